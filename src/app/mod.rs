// Application layer - Use case interactors

pub mod batch_interactor;
pub mod container;
pub mod image_interactor;
pub mod video_interactor;

// Re-export interactors
pub use batch_interactor::BatchInteractor;
pub use container::{AppContainer, DefaultAppContainer};
pub use image_interactor::ImageInteractor;
pub use video_interactor::{VideoInteractor, VideoReport, VideoRequest};
