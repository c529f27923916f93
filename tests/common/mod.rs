use std::fs::File;
use std::io::Error;
use std::path::Path;

pub fn generate_requests_csv(path: &Path, users: u64) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);

    wtr.write_record(["user_id"])?;
    for user_id in 1..=users {
        wtr.write_record([user_id.to_string()])?;
    }

    wtr.flush()?;
    Ok(())
}
