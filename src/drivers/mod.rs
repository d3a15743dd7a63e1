pub mod hw_init;
pub mod indicator;
pub mod status_led;
