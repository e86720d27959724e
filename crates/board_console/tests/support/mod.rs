use std::sync::{Arc, Mutex, MutexGuard};

use agent_board::Terminal;

#[derive(Clone)]
pub struct SharedTerminal {
    writes: Arc<Mutex<Vec<String>>>,
    columns: u16,
    rows: u16,
}

impl SharedTerminal {
    pub fn new(columns: u16, rows: u16) -> Self {
        Self {
            writes: Arc::default(),
            columns,
            rows,
        }
    }

    pub fn writes(&self) -> MutexGuard<'_, Vec<String>> {
        lock_unpoisoned(&self.writes)
    }

    pub fn output(&self) -> String {
        self.writes().concat()
    }
}

impl Terminal for SharedTerminal {
    fn write(&mut self, data: &str) {
        self.writes().push(data.to_string());
    }

    fn columns(&self) -> u16 {
        self.columns
    }

    fn rows(&self) -> u16 {
        self.rows
    }
}

pub fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
