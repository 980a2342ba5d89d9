use serde::Deserialize;

#[derive(Deserialize)]
pub struct CurrentPayload {
    pub name: String,
    pub sys: Sys,
    pub main: MainData,
    pub wind: Wind,
    pub weather: Vec<Condition>,
}

#[derive(Deserialize)]
pub struct Sys {
    pub country: String,
}

#[derive(Deserialize)]
pub struct MainData {
    pub temp: f64,
    pub feels_like: f64,
    pub humidity: u8,
    pub pressure: u32,
}

#[derive(Deserialize)]
pub struct Wind {
    pub speed: f64,
}

#[derive(Deserialize)]
pub struct Condition {
    pub description: String,
    pub icon: String,
}

#[derive(Deserialize)]
pub struct ForecastPayload {
    pub city: City,
    pub list: Vec<ForecastEntry>,
}

#[derive(Deserialize)]
pub struct City {
    pub name: String,
}

#[derive(Deserialize)]
pub struct ForecastEntry {
    pub dt_txt: String,
    pub main: SlotData,
    pub weather: Vec<Condition>,
    pub wind: Wind,
}

#[derive(Deserialize)]
pub struct SlotData {
    pub temp: f64,
    pub humidity: u8,
}
