#[tokio::main]
async fn main() {
    if let Err(e) = cancer_dss_lib::run().await {
        eprintln!("cancer-dss: {e}");
        std::process::exit(1);
    }
}
