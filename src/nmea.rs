//! NMEA-style `$PNOR*` sentence encoding of decoded records.
//!
//! Sentences follow the Nortek telemetry text formats: comma-separated
//! ASCII fields framed as `$<body>*<HH>`, where `HH` is the uppercase hex
//! XOR of every body byte. The profile sentences come in three variants:
//! the numbered one (`PNORS1`) carries the full field set, the tagged one
//! (`PNORS2`) carries the same fields as `KEY=value`, and the bare one
//! (`PNORS`) drops a fixed subset of fields from the numbered layout.
use std::fmt::Write as _;

use tracing::debug;

use crate::record::{CurrentProfile, Record, WaveData, WaveSpectrum};
use crate::timecode::DateTime;

/// A requested sentence type.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SentenceKind {
    /// Instrument and geometry info from current-profile records.
    Pnori,
    Pnori1,
    Pnori2,
    /// Sensor/orientation status from current-profile records.
    Pnors,
    Pnors1,
    Pnors2,
    /// One line per depth cell from current-profile records.
    Pnorc,
    Pnorc1,
    Pnorc2,
    /// Wave summary statistics.
    Pnorw,
    /// Swell and sea band statistics, one line each.
    Pnorb,
    /// Energy spectrum bins.
    Pnore,
    /// Fourier coefficients, four lines tagged A1/B1/A2/B2.
    Pnorf,
    /// Directional spectrum, two lines tagged MD/DS.
    Pnorwd,
}

impl SentenceKind {
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            SentenceKind::Pnori => "PNORI",
            SentenceKind::Pnori1 => "PNORI1",
            SentenceKind::Pnori2 => "PNORI2",
            SentenceKind::Pnors => "PNORS",
            SentenceKind::Pnors1 => "PNORS1",
            SentenceKind::Pnors2 => "PNORS2",
            SentenceKind::Pnorc => "PNORC",
            SentenceKind::Pnorc1 => "PNORC1",
            SentenceKind::Pnorc2 => "PNORC2",
            SentenceKind::Pnorw => "PNORW",
            SentenceKind::Pnorb => "PNORB",
            SentenceKind::Pnore => "PNORE",
            SentenceKind::Pnorf => "PNORF",
            SentenceKind::Pnorwd => "PNORWD",
        }
    }

    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        Some(match code {
            "PNORI" => SentenceKind::Pnori,
            "PNORI1" => SentenceKind::Pnori1,
            "PNORI2" => SentenceKind::Pnori2,
            "PNORS" => SentenceKind::Pnors,
            "PNORS1" => SentenceKind::Pnors1,
            "PNORS2" => SentenceKind::Pnors2,
            "PNORC" => SentenceKind::Pnorc,
            "PNORC1" => SentenceKind::Pnorc1,
            "PNORC2" => SentenceKind::Pnorc2,
            "PNORW" => SentenceKind::Pnorw,
            "PNORB" => SentenceKind::Pnorb,
            "PNORE" => SentenceKind::Pnore,
            "PNORF" => SentenceKind::Pnorf,
            "PNORWD" => SentenceKind::Pnorwd,
            _ => return None,
        })
    }
}

/// How a field list renders into a sentence body.
#[derive(Copy, Clone)]
enum Variant {
    /// Values only, with the removal set applied.
    Bare,
    /// All values.
    Numbered,
    /// All fields as `KEY=value`.
    Tagged,
}

fn checksum(body: &str) -> u8 {
    body.bytes().fold(0, |acc, b| acc ^ b)
}

fn frame(body: String) -> String {
    let sum = checksum(&body);
    format!("${body}*{sum:02X}")
}

/// Render `tag,field,...` from a key/value field list.
fn render(tag: &str, fields: &[(String, String)], variant: Variant, removed: &[&str]) -> String {
    let mut body = String::from(tag);
    for (key, value) in fields {
        match variant {
            Variant::Bare => {
                if removed.contains(&key.as_str()) {
                    continue;
                }
                let _ = write!(body, ",{value}");
            }
            Variant::Numbered => {
                let _ = write!(body, ",{value}");
            }
            Variant::Tagged => {
                let _ = write!(body, ",{key}={value}");
            }
        }
    }
    frame(body)
}

fn date_field(dt: &DateTime) -> String {
    format!("{:02}{:02}{:02}", dt.month, dt.day, dt.year % 100)
}

fn time_field(dt: &DateTime) -> String {
    format!("{:02}{:02}{:02}", dt.hour, dt.minute, dt.second)
}

fn field(key: &str, value: String) -> (String, String) {
    (key.to_string(), value)
}

fn pnori_fields(p: &CurrentProfile) -> Vec<(String, String)> {
    vec![
        field("IT", p.header.family_id.to_string()),
        field("SN", p.profile.common.serial_number.to_string()),
        field("NB", p.number_of_beams.to_string()),
        field("NC", p.number_of_cells.to_string()),
        field("BD", format!("{:.2}", p.profile.blanking_distance)),
        field("CS", format!("{:.2}", p.profile.common.cell_size)),
        field("CY", p.coordinate_system.label().to_string()),
        field("VN", p.profile.common.version.to_string()),
    ]
}

fn pnors_fields(p: &CurrentProfile) -> Vec<(String, String)> {
    let c = &p.profile.common;
    vec![
        field("DATE", date_field(&c.datetime)),
        field("TIME", time_field(&c.datetime)),
        field("ERR", format!("{:04X}", c.error_status.value)),
        field("STAT", format!("{:08X}", p.profile.status.value)),
        field("BATT", format!("{:.1}", c.battery_voltage)),
        field("SS", format!("{:.1}", c.speed_of_sound)),
        field("H", format!("{:.2}", c.heading)),
        field("PITCH", format!("{:.2}", c.pitch)),
        field("ROLL", format!("{:.2}", c.roll)),
        field("PRES", format!("{:.3}", 0.001 * f64::from(c.pressure))),
        field("TEMP", format!("{:.2}", c.temperature)),
        field("ENS", c.ensemble_counter.to_string()),
    ]
}

/// Horizontal speed and direction from the first two velocity components.
/// Direction is degrees in `[0, 360)`.
fn speed_direction(v0: f64, v1: f64) -> (f64, f64) {
    let speed = v0.hypot(v1);
    let direction = v0.atan2(v1).to_degrees().rem_euclid(360.0);
    (speed, direction)
}

fn pnorc_fields(p: &CurrentProfile, cell: usize) -> Vec<(String, String)> {
    let c = &p.profile.common;
    let cells = usize::from(p.number_of_cells);
    let beams = usize::from(p.number_of_beams);
    let mut fields = vec![
        field("DATE", date_field(&c.datetime)),
        field("TIME", time_field(&c.datetime)),
        field("CN", (cell + 1).to_string()),
    ];
    // Beam-major arrays: component b of cell c sits at b * cells + c.
    for b in 0..beams {
        let value = p
            .velocity
            .get(b * cells + cell)
            .map_or_else(String::new, |v| format!("{v:.3}"));
        fields.push(field(&format!("V{}", b + 1), value));
    }
    let (sp, dir) = if p.velocity.is_empty() || beams < 2 {
        (String::new(), String::new())
    } else {
        let (speed, direction) =
            speed_direction(p.velocity[cell], p.velocity[cells + cell]);
        (format!("{speed:.3}"), format!("{direction:.2}"))
    };
    fields.push(field("SP", sp));
    fields.push(field("DIR", dir));
    for b in 0..beams {
        let value = p
            .amplitude
            .get(b * cells + cell)
            .map_or_else(String::new, |a| format!("{a:.1}"));
        fields.push(field(&format!("A{}", b + 1), value));
    }
    for b in 0..beams {
        let value = p
            .correlation
            .get(b * cells + cell)
            .map_or_else(String::new, |c| c.to_string());
        fields.push(field(&format!("C{}", b + 1), value));
    }
    fields
}

fn pnorw(w: &WaveData) -> Option<String> {
    let p = w.parameters.as_ref()?;
    let stats = [
        p.height0,
        p.height3,
        p.height10,
        p.height_max,
        p.height_mean,
        p.period_mean,
        p.period_peak,
        p.period_z,
        p.period_1_3,
        p.period_1_10,
        p.period_max,
        p.period_energy,
        p.direction_at_peak_period,
        p.spreading_at_peak_period,
        p.wave_direction_mean,
        p.unidirectivity_index,
    ];
    let mut body = format!(
        "PNORW,{},{},{},{}",
        date_field(&w.datetime),
        time_field(&w.datetime),
        w.spectrum_type,
        w.processing_method,
    );
    for v in stats {
        let _ = write!(body, ",{v:.2}");
    }
    let _ = write!(
        body,
        ",{:.2},{},{},{:.2},{:.2},{:04X}",
        p.pressure_mean,
        w.number_of_no_detects,
        w.number_of_bad_detects,
        p.current_speed_mean,
        p.current_direction_mean,
        w.error.value & 0xffff,
    );
    Some(frame(body))
}

fn pnorb(w: &WaveData) -> Vec<String> {
    let bands = match (&w.swell, &w.sea) {
        (Some(swell), Some(sea)) => [swell, sea],
        _ => return Vec::new(),
    };
    bands
        .into_iter()
        .map(|b| {
            frame(format!(
                "PNORB,{},{},{:.3},{:.3},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2}",
                date_field(&w.datetime),
                time_field(&w.datetime),
                b.low_frequency,
                b.high_frequency,
                b.height0,
                b.period_mean,
                b.period_peak,
                b.direction_at_peak_period,
                b.wave_direction_mean,
                b.spreading_at_peak_period,
            ))
        })
        .collect()
}

fn spectrum_body(tag: &str, w: &WaveData, s: &WaveSpectrum) -> String {
    format!(
        "{tag},{},{},{:.3},{:.3},{:.3},{}",
        date_field(&w.datetime),
        time_field(&w.datetime),
        s.low_frequency,
        s.high_frequency,
        s.step_frequency,
        s.number_of_bins,
    )
}

fn pnore(w: &WaveData) -> Option<String> {
    let s = w.energy_spectrum.as_ref()?;
    let mut body = spectrum_body("PNORE", w, s);
    for v in &s.data {
        let _ = write!(body, ",{v:.4}");
    }
    Some(frame(body))
}

fn pnorf(w: &WaveData) -> Vec<String> {
    let Some(s) = w.fourier_coefficients.as_ref() else {
        return Vec::new();
    };
    ["A1", "B1", "A2", "B2"]
        .iter()
        .enumerate()
        .map(|(i, tag)| {
            let mut body = spectrum_body(&format!("PNORF,{tag}"), w, s);
            for v in s.component(i).unwrap_or_default() {
                let _ = write!(body, ",{v:.4}");
            }
            frame(body)
        })
        .collect()
}

fn pnorwd(w: &WaveData) -> Vec<String> {
    let Some(s) = w.direction_spectrum.as_ref() else {
        return Vec::new();
    };
    ["MD", "DS"]
        .iter()
        .enumerate()
        .map(|(i, tag)| {
            let mut body = spectrum_body(&format!("PNORWD,{tag}"), w, s);
            for v in s.component(i).unwrap_or_default() {
                let _ = write!(body, ",{v:.2}");
            }
            frame(body)
        })
        .collect()
}

fn profile_sentences(kind: SentenceKind, p: &CurrentProfile, out: &mut Vec<String>) {
    match kind {
        SentenceKind::Pnori => out.push(render("PNORI", &pnori_fields(p), Variant::Bare, &["VN"])),
        SentenceKind::Pnori1 => {
            out.push(render("PNORI1", &pnori_fields(p), Variant::Numbered, &[]))
        }
        SentenceKind::Pnori2 => out.push(render("PNORI2", &pnori_fields(p), Variant::Tagged, &[])),
        SentenceKind::Pnors => out.push(render("PNORS", &pnors_fields(p), Variant::Bare, &["ENS"])),
        SentenceKind::Pnors1 => {
            out.push(render("PNORS1", &pnors_fields(p), Variant::Numbered, &[]))
        }
        SentenceKind::Pnors2 => out.push(render("PNORS2", &pnors_fields(p), Variant::Tagged, &[])),
        SentenceKind::Pnorc | SentenceKind::Pnorc1 | SentenceKind::Pnorc2 => {
            for cell in 0..usize::from(p.number_of_cells) {
                let fields = pnorc_fields(p, cell);
                out.push(match kind {
                    SentenceKind::Pnorc => {
                        render("PNORC", &fields, Variant::Bare, &["SP", "DIR"])
                    }
                    SentenceKind::Pnorc1 => render("PNORC1", &fields, Variant::Numbered, &[]),
                    _ => render("PNORC2", &fields, Variant::Tagged, &[]),
                });
            }
        }
        _ => {}
    }
}

fn wave_sentences(kind: SentenceKind, w: &WaveData, out: &mut Vec<String>) {
    match kind {
        SentenceKind::Pnorw => out.extend(pnorw(w)),
        SentenceKind::Pnorb => out.extend(pnorb(w)),
        SentenceKind::Pnore => out.extend(pnore(w)),
        SentenceKind::Pnorf => out.extend(pnorf(w)),
        SentenceKind::Pnorwd => out.extend(pnorwd(w)),
        _ => {}
    }
}

/// Encode every record into the requested sentence types, preserving record
/// order. Records a kind does not apply to produce nothing for that kind;
/// wave sub-block sentences are dropped when the record does not carry the
/// sub-block.
#[must_use]
pub fn encode(records: &[Record], kinds: &[SentenceKind]) -> Vec<String> {
    let mut out = Vec::new();
    for record in records {
        for &kind in kinds {
            match record {
                Record::CurrentProfile(p) => profile_sentences(kind, p, &mut out),
                Record::Wave(w) => wave_sentences(kind, w, &mut out),
                _ => {}
            }
        }
    }
    debug!(
        records = records.len(),
        sentences = out.len(),
        "encoded sentences"
    );
    out
}
