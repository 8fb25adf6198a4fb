pub mod forecast;
pub mod openweathermap;
