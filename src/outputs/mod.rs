//! Digest rendering.
//!
//! The composer turns the run's surviving posts into the single HTML
//! document that gets mailed out. Rendering is plain string building; the
//! message itself is assembled in the mailer.

pub mod html;
