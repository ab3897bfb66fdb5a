// rest_api/src/bin/create_patient.rs

use lambda_http::Error;
use rest_api::{run_function, Operation};

#[tokio::main]
async fn main() -> Result<(), Error> {
    run_function(Operation::CreatePatient).await
}
