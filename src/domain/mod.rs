pub mod ports;
pub mod record;
pub mod reward;
