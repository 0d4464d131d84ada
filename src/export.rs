use crate::store::PdfRecord;
use std::error::Error;
use std::io::Write;
use std::path::Path;

pub fn write_records_to_csv(
    records: &[PdfRecord],
    file_path: &Path,
    with_hash: bool,
) -> Result<(), Box<dyn Error>> {
    let file = std::fs::File::create(file_path)?;
    write_records(records, file, with_hash)
}

pub fn write_records<W: Write>(
    records: &[PdfRecord],
    target: W,
    with_hash: bool,
) -> Result<(), Box<dyn Error>> {
    let mut writer = csv::Writer::from_writer(target);

    if with_hash {
        writer.write_record(["file_name", "status", "hash"])?;
    } else {
        writer.write_record(["file_name", "status"])?;
    }

    for record in records {
        let status = record.document_status();
        if with_hash {
            writer.write_record([record.file_name.as_str(), status.as_str(), record.hash.as_str()])?;
        } else {
            writer.write_record([record.file_name.as_str(), status.as_str()])?;
        }
    }

    writer.flush()?;

    Ok(())
}
