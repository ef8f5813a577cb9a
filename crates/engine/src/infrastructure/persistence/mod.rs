pub mod memory;

pub use memory::InMemoryGameRepository;
