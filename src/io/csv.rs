use std::io::{self, Write};
use std::path::Path;

use crate::engine::state::Telemetry;

/// Write a telemetry trace in CSV format.
///
/// Columns: t, rpm, throttle, eff_throttle, gear, boost, target_boost,
///          torque, afr, speed_kmh, coolant_temp, fuel_cut, limp_mode,
///          backfire, brake
pub fn write_telemetry<W: Write>(writer: &mut W, trace: &[Telemetry]) -> io::Result<()> {
    writeln!(
        writer,
        "t,rpm,throttle,eff_throttle,gear,boost,target_boost,\
         torque,afr,speed_kmh,coolant_temp,fuel_cut,limp_mode,backfire,brake"
    )?;

    for t in trace {
        writeln!(
            writer,
            "{:.4},{:.1},{:.3},{:.3},{},{:.4},{:.4},\
             {:.2},{:.2},{:.2},{:.2},{},{},{},{}",
            t.time,
            t.rpm,
            t.throttle,
            t.eff_throttle,
            t.gear,
            t.boost,
            t.target_boost,
            t.torque,
            t.afr,
            t.speed_kmh,
            t.coolant_temp,
            u8::from(t.fuel_cut),
            u8::from(t.limp_mode),
            u8::from(t.backfire),
            u8::from(t.brake),
        )?;
    }

    Ok(())
}

/// Write a telemetry trace to a CSV file at the given path.
pub fn write_telemetry_file(path: impl AsRef<Path>, trace: &[Telemetry]) -> io::Result<()> {
    let mut file = io::BufWriter::new(std::fs::File::create(path)?);
    write_telemetry(&mut file, trace)?;
    file.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EngineConfig;
    use crate::sim::simulate;

    #[test]
    fn csv_output_has_header_and_rows() {
        let run = simulate(&EngineConfig::default(), 0.05, 0);

        let mut buf = Vec::new();
        write_telemetry(&mut buf, &run.telemetry).unwrap();
        let output = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = output.lines().collect();

        assert!(lines[0].starts_with("t,rpm,"));
        assert_eq!(lines.len(), run.telemetry.len() + 1);
        assert!(lines[1].starts_with("0.0000,900.0,"));
        let columns = lines[0].split(',').count();
        assert!(lines.iter().all(|l| l.split(',').count() == columns));
    }
}
