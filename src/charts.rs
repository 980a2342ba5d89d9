use std::ops::Range;
use chrono::NaiveDateTime;
use plotters::coord::Shift;
use plotters::coord::types::RangedDateTime;
use plotters::prelude::*;
use thiserror::Error;
use crate::models::{CurrentWeatherRecord, ForecastRecord};

const DASHBOARD_SIZE: (u32, u32) = (1800, 1500);
const ORANGE: RGBColor = RGBColor(255, 165, 0);

/// Renders the dashboard image with the fixed panel grid
///
/// # Arguments
///
/// * 'path' - path to the output image file
/// * 'current' - aggregated current conditions, one record per city
/// * 'forecast' - aggregated forecast slots for all cities
pub fn render_dashboard(path: &str, current: &[CurrentWeatherRecord], forecast: &[ForecastRecord]) -> Result<(), ChartError> {
    draw_dashboard(path, current, forecast)
        .map_err(|e| ChartError::RenderError(e.to_string()))
}

/// Draws the 3x3 panel grid onto one bitmap
///
/// # Arguments
///
/// * 'path' - path to the output image file
/// * 'current' - aggregated current conditions
/// * 'forecast' - aggregated forecast slots
fn draw_dashboard(path: &str, current: &[CurrentWeatherRecord], forecast: &[ForecastRecord]) -> Result<(), Box<dyn std::error::Error>> {
    let Some(first) = current.first() else {
        return Ok(());
    };

    let root = BitMapBackend::new(path, DASHBOARD_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let panels = root.split_evenly((3, 3));

    let cities: Vec<String> = current.iter().map(|r| r.city.clone()).collect();
    let palette: Vec<RGBAColor> = (0..current.len()).map(|i| Palette99::pick(i).to_rgba()).collect();

    let temperatures: Vec<f64> = current.iter().map(|r| r.temperature).collect();
    draw_bar_panel(&panels[0], "Current Temperature (°C)", &cities, &temperatures, &palette)?;

    let humidity: Vec<f64> = current.iter().map(|r| r.humidity as f64).collect();
    draw_bar_panel(&panels[1], "Humidity (%)", &cities, &humidity, &palette)?;

    let (parameter_labels, parameters) = parameter_values(first);
    let parameter_colors: Vec<RGBAColor> = (0..parameters.len()).map(|i| Palette99::pick(i).to_rgba()).collect();
    draw_bar_panel(
        &panels[2],
        &format!("Weather Parameters - {}", first.city),
        &parameter_labels,
        &parameters,
        &parameter_colors,
    )?;

    let temp_humidity: Vec<(f64, f64, String)> = current.iter()
        .map(|r| (r.temperature, r.humidity as f64, r.city.clone()))
        .collect();
    draw_scatter_panel(&panels[3], "Temperature vs Humidity", "Temperature (°C)", "Humidity (%)", &temp_humidity)?;

    let wind: Vec<f64> = current.iter().map(|r| r.wind_speed).collect();
    let wind_colors: Vec<RGBAColor> = wind.iter().map(|w| wind_color(*w)).collect();
    draw_bar_panel(&panels[4], "Wind Speed (m/s)", &cities, &wind, &wind_colors)?;

    let trend: Vec<(NaiveDateTime, f64)> = forecast.iter()
        .filter(|f| f.city == first.city)
        .map(|f| (f.date_time, f.temperature))
        .collect();
    draw_forecast_panel(&panels[5], &first.city, &trend)?;

    let conditions = description_counts(current);
    let condition_labels: Vec<String> = conditions.iter().map(|(d, _)| d.clone()).collect();
    let condition_counts: Vec<f64> = conditions.iter().map(|(_, n)| *n as f64).collect();
    let condition_colors: Vec<RGBAColor> = (0..conditions.len()).map(|i| Palette99::pick(i).to_rgba()).collect();
    draw_bar_panel(&panels[6], "Weather Conditions", &condition_labels, &condition_counts, &condition_colors)?;

    let pressure_temp: Vec<(f64, f64, String)> = current.iter()
        .map(|r| (r.pressure as f64, r.temperature, r.city.clone()))
        .collect();
    draw_scatter_panel(&panels[7], "Pressure vs Temperature", "Pressure (hPa)", "Temperature (°C)", &pressure_temp)?;

    draw_summary_panel(&panels[8], current)?;

    root.present()?;

    Ok(())
}

/// Draws one bar panel with one labelled bar per value
///
/// # Arguments
///
/// * 'area' - panel drawing area
/// * 'caption' - panel caption
/// * 'labels' - bar labels, same length as values
/// * 'values' - bar values
/// * 'colors' - bar colors, same length as values
fn draw_bar_panel(
    area: &DrawingArea<BitMapBackend, Shift>,
    caption: &str,
    labels: &[String],
    values: &[f64],
    colors: &[RGBAColor],
) -> Result<(), Box<dyn std::error::Error>> {
    let range = padded_range(values);
    let y_range = range.start.min(0.0)..range.end;

    let mut chart = ChartBuilder::on(area)
        .caption(caption, ("sans-serif", 22))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d((0..values.len()).into_segmented(), y_range)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_label_formatter(&|v| match v {
            SegmentValue::CenterOf(i) => labels.get(*i).cloned().unwrap_or_default(),
            _ => String::new(),
        })
        .light_line_style(BLACK.mix(0.15))
        .draw()?;

    chart.draw_series(values.iter().enumerate().map(|(i, v)| {
        let mut bar = Rectangle::new(
            [(SegmentValue::Exact(i), 0.0), (SegmentValue::Exact(i + 1), *v)],
            colors[i].filled(),
        );
        bar.set_margin(0, 0, 10, 10);
        bar
    }))?;

    Ok(())
}

/// Draws one scatter panel with a labelled point per city
///
/// # Arguments
///
/// * 'area' - panel drawing area
/// * 'caption' - panel caption
/// * 'x_desc' - x axis description
/// * 'y_desc' - y axis description
/// * 'points' - x, y and label per point
fn draw_scatter_panel(
    area: &DrawingArea<BitMapBackend, Shift>,
    caption: &str,
    x_desc: &str,
    y_desc: &str,
    points: &[(f64, f64, String)],
) -> Result<(), Box<dyn std::error::Error>> {
    let xs: Vec<f64> = points.iter().map(|p| p.0).collect();
    let ys: Vec<f64> = points.iter().map(|p| p.1).collect();

    let mut chart = ChartBuilder::on(area)
        .caption(caption, ("sans-serif", 22))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(padded_range(&xs), padded_range(&ys))?;

    chart
        .configure_mesh()
        .x_desc(x_desc)
        .y_desc(y_desc)
        .light_line_style(BLACK.mix(0.15))
        .draw()?;

    chart.draw_series(points.iter().map(|(x, y, label)| {
        EmptyElement::at((*x, *y))
            + Circle::new((0, 0), 5, BLUE.filled())
            + Text::new(label.clone(), (8, -6), ("sans-serif", 13))
    }))?;

    Ok(())
}

/// Draws the forecast temperature trend for one city.
/// A trend needs at least two slots, with fewer the panel is left empty.
///
/// # Arguments
///
/// * 'area' - panel drawing area
/// * 'city' - name of the city the trend belongs to
/// * 'points' - slot time and temperature per forecast slot
fn draw_forecast_panel(
    area: &DrawingArea<BitMapBackend, Shift>,
    city: &str,
    points: &[(NaiveDateTime, f64)],
) -> Result<(), Box<dyn std::error::Error>> {
    if points.len() < 2 {
        return Ok(());
    }

    let (min_dt, max_dt) = points
        .iter()
        .fold((points[0].0, points[0].0), |(min, max), (dt, _)| (min.min(*dt), max.max(*dt)));
    let temperatures: Vec<f64> = points.iter().map(|p| p.1).collect();

    let mut chart = ChartBuilder::on(area)
        .caption(format!("5-Day Forecast - {}", city), ("sans-serif", 22))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(RangedDateTime::from(min_dt..max_dt), padded_range(&temperatures))?;

    chart
        .configure_mesh()
        .y_desc("Temperature (°C)")
        .x_label_formatter(&|dt: &NaiveDateTime| dt.format("%m-%d %Hh").to_string())
        .light_line_style(BLACK.mix(0.15))
        .draw()?;

    chart.draw_series(LineSeries::new(points.iter().cloned(), &BLUE))?;
    chart.draw_series(points.iter().map(|p| Circle::new(*p, 3, BLUE.filled())))?;

    Ok(())
}

/// Draws the summary panel, one text line per city
///
/// # Arguments
///
/// * 'area' - panel drawing area
/// * 'current' - aggregated current conditions
fn draw_summary_panel(
    area: &DrawingArea<BitMapBackend, Shift>,
    current: &[CurrentWeatherRecord],
) -> Result<(), Box<dyn std::error::Error>> {
    area.draw(&Text::new("Weather Summary".to_string(), (40, 25), ("sans-serif", 22)))?;

    let header = format!("{:<14} {:>9} {:>11} {:>10}", "City", "Temp °C", "Humidity %", "Wind m/s");
    area.draw(&Text::new(header, (40, 70), ("monospace", 16)))?;

    for (i, line) in current.iter().map(summary_line).enumerate() {
        area.draw(&Text::new(line, (40, 100 + (i as i32) * 28), ("monospace", 16)))?;
    }

    Ok(())
}

/// Returns the labels and values of the parameter overview for one city.
/// Pressure and wind speed are scaled so all bars fit one axis.
///
/// # Arguments
///
/// * 'record' - current conditions record to take the parameters from
fn parameter_values(record: &CurrentWeatherRecord) -> (Vec<String>, Vec<f64>) {
    let labels = vec![
        "Temperature".to_string(),
        "Humidity".to_string(),
        "Pressure/10".to_string(),
        "Wind x10".to_string(),
    ];
    let values = vec![
        record.temperature,
        record.humidity as f64,
        record.pressure as f64 / 10.0,
        record.wind_speed * 10.0,
    ];

    (labels, values)
}

/// Counts records per weather description, in first-seen order
///
/// # Arguments
///
/// * 'records' - aggregated current conditions
fn description_counts(records: &[CurrentWeatherRecord]) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();

    for record in records {
        match counts.iter_mut().find(|(description, _)| *description == record.description) {
            Some((_, count)) => *count += 1,
            None => counts.push((record.description.clone(), 1)),
        }
    }

    counts
}

/// Formats one summary line for a city
///
/// # Arguments
///
/// * 'record' - current conditions record to summarize
fn summary_line(record: &CurrentWeatherRecord) -> String {
    format!("{:<14} {:>9.1} {:>11} {:>10.1}", record.city, record.temperature, record.humidity, record.wind_speed)
}

/// Returns the value range padded for axis headroom
///
/// # Arguments
///
/// * 'values' - values to span
fn padded_range(values: &[f64]) -> Range<f64> {
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let pad = if (max - min).abs() > 1e-6 { (max - min) * 0.1 } else { 1.0 };

    (min - pad)..(max + pad)
}

/// Picks the bar color for a wind speed bar
///
/// # Arguments
///
/// * 'speed' - wind speed in m/s
fn wind_color(speed: f64) -> RGBAColor {
    if speed > 5.0 {
        RED.to_rgba()
    } else if speed > 3.0 {
        ORANGE.to_rgba()
    } else {
        GREEN.to_rgba()
    }
}

/// Error depicting errors that occur while rendering the dashboard
///
#[derive(Debug, Error)]
pub enum ChartError {
    #[error("RenderError: {0}")]
    RenderError(String),
}
