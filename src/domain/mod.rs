// Domain layer - Console state with no I/O
pub mod console;
pub mod oven;
pub mod profile;
pub mod sample;
pub mod selection;
