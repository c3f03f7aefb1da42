pub mod profiles_sea;
