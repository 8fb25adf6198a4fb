use serde::Deserialize;

#[derive(Deserialize)]
pub struct Main {
    pub temp: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub humidity: f64,
}

#[derive(Deserialize)]
pub struct Weather {
    pub description: String,
    pub icon: String,
}

#[derive(Deserialize)]
pub struct Wind {
    pub speed: f64,
    #[serde(default)]
    pub deg: f64,
}

#[derive(Deserialize, Default)]
pub struct Rain {
    #[serde(rename = "3h", default)]
    pub three_hours: f64,
}

#[derive(Deserialize)]
pub struct ListEntry {
    pub dt: i64,
    pub main: Main,
    pub weather: Vec<Weather>,
    pub wind: Wind,
    pub pop: Option<f64>,
    #[serde(default)]
    pub rain: Rain,
}

#[derive(Deserialize)]
pub struct City {
    pub name: String,
    #[serde(default)]
    pub timezone: i32,
}

#[derive(Deserialize)]
pub struct FullForecast {
    pub list: Vec<ListEntry>,
    pub city: City,
}

#[derive(Deserialize)]
pub struct GeoLocation {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Deserialize)]
pub struct UvIndex {
    pub value: Option<f64>,
}
