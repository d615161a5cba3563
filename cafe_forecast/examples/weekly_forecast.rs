use cafe_forecast::models::{Feature, LinearModel, ModelArtifact};
use cafe_forecast::{DataLoader, RollingForecaster, SalesModel};
use std::io::Cursor;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Three weeks of sales, busier at the weekend
    let mut csv = String::from("transaction_date,transaction_time,product_detail,product_category,transaction_qty,unit_price,total_sales\n");
    for day in 1..=21 {
        let qty = if day % 7 == 6 || day % 7 == 0 { 6 } else { 4 };
        csv.push_str(&format!(
            "2024-04-{:02},09:15:00,Latte,Drinks,{},45.0,{:.1}\n",
            day,
            qty,
            qty as f64 * 45.0
        ));
    }

    let log = DataLoader::from_reader(Cursor::new(csv))?;
    let series = log.daily_sales();
    println!("Loaded {} days of sales", series.len());

    // Stand-in for a trained artifact
    let model = ModelArtifact::Linear(LinearModel::new(
        vec![Feature::IsWeekend, Feature::SalesLag7, Feature::RollingMean7],
        vec![40.0, 0.6, 0.4],
        -10.0,
    )?);

    let result = RollingForecaster::default().forecast(&series, &model)?;

    println!("Forecast for the next 7 days using {}:", model.name());
    for point in &result.points {
        println!("{}: {:.2}", point.date, point.predicted_total);
    }
    println!(
        "Past week avg {:.2}, next week avg {:.2} ({:+.1}%, {})",
        result.avg_past_7, result.avg_future_7, result.trend_percent, result.trend
    );

    Ok(())
}
