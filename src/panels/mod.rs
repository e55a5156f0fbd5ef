pub mod calibration_ui;
pub mod card;
pub mod overlay;
pub mod plane_shift_ui;
pub mod result_ui;
pub mod status_ui;

pub use calibration_ui::CalibrationCard;
pub use card::Card;
pub use result_ui::ResultCard;
