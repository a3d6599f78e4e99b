pub mod driver;

pub use driver::{BrowserConfig, WebDriver, WebSessionFactory};
