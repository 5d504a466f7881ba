pub mod generate_dish_image;
