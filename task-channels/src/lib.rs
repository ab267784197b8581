pub mod channel_transport;
