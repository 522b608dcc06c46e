pub mod mail_relay;
