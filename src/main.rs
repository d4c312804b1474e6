use std::io::Read;
use std::process;

fn main() {
    if let Err(err) = run() {
        eprintln!("velo-window: {}", err);
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let result = velo_window::bootstrap::default_init()?;
    let sql = match result.sql {
        Some(sql) => sql,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    if sql.trim().is_empty() {
        return Err("no SQL given; pass it with --sql, as trailing arguments or on stdin".into());
    }

    let output = velo_window::explain_sql(&sql, &result.catalog, &result.registry, result.format)
        .map_err(|err| {
            tracing::error!(error = %err, "planning failed");
            err
        })?;
    println!("{}", output);
    Ok(())
}
