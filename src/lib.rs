//! Task tracking over two collections: local tasks kept in a key-value store and
//! remote tasks served by a REST endpoint, both held by one [`TaskStore`].

pub mod actions;
pub mod auth;
pub mod config;
pub mod debounce;
pub mod logging;
pub mod models;
pub mod mutation;
pub mod notify;
pub mod remote;
pub mod reorder;
pub mod state;
pub mod storage;
pub mod validation;
pub mod view;

pub use actions::TaskActions;
pub use models::{Filter, NewTask, OrderEntry, Task, TaskPatch};
pub use mutation::{reduce, Mutation, TaskState};
pub use remote::{HttpTaskService, RemoteError, TaskService};
pub use state::TaskStore;
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
