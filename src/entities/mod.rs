pub mod alert;
pub mod directory_entry;
pub mod document;
pub mod gallery_item;
pub mod hero_slide;
pub mod news;
pub mod office_setting;
pub mod project;
pub mod tender;
pub mod user;
pub mod vacancy;
pub mod woreda;

pub mod prelude {
    pub use super::alert::Entity as Alert;
    pub use super::directory_entry::Entity as DirectoryEntry;
    pub use super::document::Entity as Document;
    pub use super::gallery_item::Entity as GalleryItem;
    pub use super::hero_slide::Entity as HeroSlide;
    pub use super::news::Entity as News;
    pub use super::office_setting::Entity as OfficeSetting;
    pub use super::project::Entity as Project;
    pub use super::tender::Entity as Tender;
    pub use super::user::Entity as User;
    pub use super::vacancy::Entity as Vacancy;
    pub use super::woreda::Entity as Woreda;
}

pub use alert::AlertLevel;
pub use news::NewsStatus;
pub use project::ProjectStatus;
pub use tender::TenderStatus;
pub use user::Role;
pub use vacancy::VacancyStatus;
