pub mod db;
pub mod entities;
pub mod services;

#[cfg(any(test, feature = "testing"))]
pub mod testing;
