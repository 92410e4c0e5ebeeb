pub mod assess;
pub mod connectivity;
pub mod health;
pub mod history;
pub mod scenario;
