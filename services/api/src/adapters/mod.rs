pub mod chat_llm;
pub mod collection;
pub mod db;
pub mod echo;
pub mod file_store;

pub use chat_llm::OpenAiChatAdapter;
pub use db::DbAdapter;
pub use echo::EchoResponder;
pub use file_store::FileStore;
