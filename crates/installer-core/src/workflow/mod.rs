//! Command workflows wired together by the `laravel` binary

pub mod artisan;
pub mod clone;
pub mod configure;
pub mod docs;
pub mod new_app;

pub use new_app::NewApplication;
