use std::fmt::Display;
use std::io::{self, Write};

use chrono::NaiveDate;

use crate::geo_location::Location;
use crate::times::TimeOfDayReport;

// Values start in this column
const LABEL_WIDTH: usize = 30;

/// Writes the report for one location and date.
///
/// Unknown values leave their slot empty.
pub fn render(
    out: &mut impl Write,
    location: &Location,
    date: NaiveDate,
    report: &TimeOfDayReport,
) -> io::Result<()> {
    writeln!(
        out,
        "{} {:.3},{:.3} ({})",
        location.city, location.latitude, location.longitude, location.timezone
    )?;
    writeln!(out, "{}", date.format("%A, %b %d, %Y"))?;
    writeln!(out)?;

    field(out, "Sunrise", report.sunrise)?;
    field(out, "Sunset", report.sunset)?;
    field(out, "Solar noon", report.solar_noon)?;
    field(out, "Day length", report.day_length)?;
    writeln!(out, "Twilight")?;
    field(out, "- Civil (beg)", report.civil_twilight_begin)?;
    field(out, "- Civil (end)", report.civil_twilight_end)?;
    field(out, "- Nautical (beg)", report.nautical_twilight_begin)?;
    field(out, "- Nautical (end)", report.nautical_twilight_end)?;
    field(out, "- Astronomical (beg)", report.astronomical_twilight_begin)?;
    field(out, "- Astronomical (end)", report.astronomical_twilight_end)?;

    out.flush()
}

fn field(out: &mut impl Write, label: &str, value: impl Display) -> io::Result<()> {
    writeln!(out, "{label:<LABEL_WIDTH$}{value}")
}
