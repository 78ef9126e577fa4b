pub mod mirror_server;
