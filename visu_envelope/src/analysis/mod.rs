pub mod decoder;
pub mod normalizer;
pub mod renderer;
pub mod scanner;
