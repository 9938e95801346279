pub mod app;
pub mod articles;
pub mod auth_usecase;
pub mod history;
pub mod logging;
pub mod pages;
pub mod scan_usecase;

pub use app::{App, RenderedPage};
pub use auth_usecase::AuthUseCase;
pub use history::{HistoryPage, HistoryQuery, HistorySort};
pub use pages::{PageContext, PageController, PageView};
pub use scan_usecase::ScanUseCase;
