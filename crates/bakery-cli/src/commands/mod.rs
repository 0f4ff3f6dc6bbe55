mod cart;
mod checkout;
mod init;
mod order;
mod product;
mod shop;

pub use cart::{
    add as cart_add, clear as cart_clear, remove as cart_remove, set as cart_set,
    show as cart_show,
};
pub use checkout::execute as checkout;
pub use init::execute as init;
pub use order::{
    list as order_list, remove as order_remove, show as order_show, status as order_status,
};
pub use product::{
    add as product_add, categories as product_categories, list as product_list,
    remove as product_remove, show as product_show, update_stock as product_update_stock,
};
pub use shop::{
    close as shop_close, history as shop_history, open as shop_open, status as shop_status,
};
