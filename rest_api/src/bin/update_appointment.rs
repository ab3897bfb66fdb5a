// rest_api/src/bin/update_appointment.rs

use lambda_http::Error;
use rest_api::{run_function, Operation};

#[tokio::main]
async fn main() -> Result<(), Error> {
    run_function(Operation::UpdateAppointment).await
}
