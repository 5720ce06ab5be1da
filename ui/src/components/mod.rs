pub mod admin_route;
pub mod confirmation_modal;
pub mod filter_panel;
pub mod image_slider;
pub mod image_upload;
pub mod layout;
pub mod login_form;
pub mod pagination_controls;
pub mod property_card;
pub mod search_bar;
pub mod toast;

pub use admin_route::AdminRoute;
pub use confirmation_modal::ConfirmationModal;
pub use filter_panel::FilterPanel;
pub use image_slider::ImageSlider;
pub use image_upload::ImageUpload;
pub use layout::MainLayout;
pub use login_form::LoginForm;
pub use pagination_controls::PaginationControls;
pub use property_card::PropertyCard;
pub use search_bar::SearchBar;
pub use toast::ToastContainer;
