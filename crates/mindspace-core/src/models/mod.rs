pub mod answer;
pub mod credentials;
pub mod question;
pub mod severity;
pub mod submission;
