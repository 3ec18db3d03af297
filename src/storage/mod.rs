pub mod engine;
pub mod fake;
pub mod memory;
pub mod mongo;

pub use engine::DocumentStore;
pub use fake::FakeStore;
pub use memory::InMemoryDocumentStore;
pub use mongo::MongoDocumentStore;
