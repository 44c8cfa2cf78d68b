pub mod db;
pub mod device;
pub mod storage;
pub mod vision_llm;

pub use db::DbAdapter;
pub use device::LocalDeviceEnvironment;
pub use storage::SupabaseStorageAdapter;
pub use vision_llm::OpenAiVisionAdapter;
