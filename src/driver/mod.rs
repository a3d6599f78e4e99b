pub mod traits;
pub mod web;

pub use traits::{BrowserDriver, SelectorSpec, SessionFactory, Strategy};
pub use web::{BrowserConfig, WebDriver, WebSessionFactory};
