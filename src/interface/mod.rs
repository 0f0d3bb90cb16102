pub mod amqp;
