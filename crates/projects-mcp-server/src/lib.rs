pub mod errors;
pub mod graphql;
pub mod json_schema;
pub mod mutation_mode;
pub mod owner;
pub mod server;
mod server_handler;
pub mod tools;

#[cfg(test)]
mod testing;
