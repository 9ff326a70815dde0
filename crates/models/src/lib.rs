pub mod errors;
pub mod db;
pub mod contact;
pub mod message;
pub mod user;

#[cfg(test)]
mod tests;
