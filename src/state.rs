use crate::repository::HabitRepository;
use crate::store::KeyValueStore;
use std::sync::Arc;
use tokio::sync::Mutex;

pub type DynStore = Box<dyn KeyValueStore>;

#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Mutex<HabitRepository<DynStore>>>,
}

impl AppState {
    pub fn new(repo: HabitRepository<DynStore>) -> Self {
        Self {
            repo: Arc::new(Mutex::new(repo)),
        }
    }
}
