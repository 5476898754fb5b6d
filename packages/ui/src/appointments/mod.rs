//! "My Appointments" components: live queue progress per booking.

mod my_appointments_page;
mod progress_bar;
mod progress_card;

pub use my_appointments_page::MyAppointmentsPage;
pub use progress_bar::ProgressBar;
pub use progress_card::{QueueProgressCard, wait_label};
