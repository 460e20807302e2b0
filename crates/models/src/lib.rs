pub mod errors;
pub mod db;
pub mod period;
pub mod subscription;

#[cfg(test)]
mod tests;
