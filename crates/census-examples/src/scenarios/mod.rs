pub mod balanced;
pub mod leaky;
pub mod tasks;
