pub mod areas;
pub mod council;
pub mod matcher;
pub mod notify;
pub mod rota;
pub mod worker;
