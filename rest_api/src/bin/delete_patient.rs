// rest_api/src/bin/delete_patient.rs

use lambda_http::Error;
use rest_api::{run_function, Operation};

#[tokio::main]
async fn main() -> Result<(), Error> {
    run_function(Operation::DeletePatient).await
}
