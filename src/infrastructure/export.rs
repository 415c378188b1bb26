use crate::domain::{Station, Summary};

pub struct TallyExporter;

impl TallyExporter {
    /// Writes one row per station followed by a total row.
    ///
    /// The total row reads `overflow` when the counts do not sum within a `u64`.
    pub fn export_to_csv(stations: &[Station], filename: &str) -> Result<String, String> {
        let mut writer = csv::Writer::from_path(filename).map_err(|e| e.to_string())?;

        writer
            .write_record(["station", "name", "count"])
            .map_err(|e| e.to_string())?;
        for station in stations {
            writer
                .write_record([
                    (station.id + 1).to_string(),
                    station.name.clone(),
                    station.count.to_string(),
                ])
                .map_err(|e| e.to_string())?;
        }

        let summary = Summary::from_stations(stations);
        writer
            .write_record(["", "TOTAL", summary.total_label().as_str()])
            .map_err(|e| e.to_string())?;
        writer.flush().map_err(|e| e.to_string())?;

        Ok(filename.to_string())
    }
}
