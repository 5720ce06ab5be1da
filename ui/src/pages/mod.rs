pub mod login;
pub mod not_found;
pub mod property_details;
pub mod property_form;
pub mod property_list;

pub use login::LoginPage;
pub use not_found::NotFoundPage;
pub use property_details::PropertyDetailsPage;
pub use property_form::PropertyFormPage;
pub use property_list::PropertyListPage;
