pub mod assistant;
pub mod dashboard;
pub mod documents;
pub mod export;
pub mod health;
pub mod history;
pub mod review;
pub mod templates;
