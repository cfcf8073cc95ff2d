pub mod poster_server;
