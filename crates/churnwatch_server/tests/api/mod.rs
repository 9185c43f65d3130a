mod drift;
mod health;
mod predict;
