pub mod admin;
pub mod history;
pub mod routes;
pub mod session;
