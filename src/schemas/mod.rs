pub mod alerts;
pub mod auth;
pub mod common;
pub mod directory;
pub mod documents;
pub mod gallery;
pub mod hero_slides;
pub mod news;
pub mod projects;
pub mod settings;
pub mod tenders;
pub mod vacancies;
pub mod woredas;

pub use common::{AdminListQuery, CreatedResponse, SuccessResponse};
