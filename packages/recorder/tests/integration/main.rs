mod country;
mod registration;
mod vessel;
