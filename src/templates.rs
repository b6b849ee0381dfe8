use crate::models::{Frequency, HabitTemplate};

pub static TEMPLATES: [HabitTemplate; 6] = [
    HabitTemplate {
        id: "water",
        name: "Drink 8 glasses of water",
        description: "Stay hydrated throughout the day",
        frequency: Frequency::Daily,
        category: "Health",
        is_popular: true,
    },
    HabitTemplate {
        id: "meditation",
        name: "Morning meditation",
        description: "Start your day with mindfulness",
        frequency: Frequency::Daily,
        category: "Mindfulness",
        is_popular: true,
    },
    HabitTemplate {
        id: "reading",
        name: "Read for 30 minutes",
        description: "Expand your knowledge through reading",
        frequency: Frequency::Daily,
        category: "Learning",
        is_popular: true,
    },
    HabitTemplate {
        id: "exercise",
        name: "Exercise for 30 minutes",
        description: "Stay active and healthy",
        frequency: Frequency::Daily,
        category: "Fitness",
        is_popular: true,
    },
    HabitTemplate {
        id: "journal",
        name: "Write in journal",
        description: "Reflect on your day and thoughts",
        frequency: Frequency::Daily,
        category: "Self-reflection",
        is_popular: false,
    },
    HabitTemplate {
        id: "gratitude",
        name: "Practice gratitude",
        description: "Write down 3 things you're grateful for",
        frequency: Frequency::Daily,
        category: "Mindfulness",
        is_popular: false,
    },
];

pub fn popular_templates() -> impl Iterator<Item = &'static HabitTemplate> {
    TEMPLATES.iter().filter(|template| template.is_popular)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_popular_templates() {
        assert_eq!(popular_templates().count(), 4);
        assert!(popular_templates().all(|t| !t.category.is_empty()));
    }
}
