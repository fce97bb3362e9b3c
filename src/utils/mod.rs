pub mod db_utils;
pub mod retry;
pub mod seed;
pub mod username_cache;
