#![allow(dead_code)]

use std::fs;
use std::path::Path;

/// Write the four inventory fixture files into `dir`.
///
/// Vendor 105 / brand 58: purchases and sales.
/// Vendor 105 / brand 62: purchases only (no sales rows).
/// Vendor 4466 / brand 8412: purchases and sales, no freight invoice.
/// Vendor 9000 / brand 77: zero purchase price, filtered out of the summary.
pub fn write_inventory_fixtures(dir: &Path) {
    fs::write(
        dir.join("purchases.csv"),
        "\
InventoryId,Store,Brand,Description,Size,VendorNumber,VendorName,PurchasePrice,Quantity,Dollars
1_HARDERSFIELD_58,1,58,Gekkeikan Black & Gold Sake,750mL,105,ALTAMAR BRANDS LLC         ,10.0,4,40.0
1_HARDERSFIELD_58,1,58,Gekkeikan Black & Gold Sake,750mL,105,ALTAMAR BRANDS LLC         ,10.0,6,60.0
2_ASHBORNE_62,2,62,Herradura Silver Tequila,750mL,105,ALTAMAR BRANDS LLC         ,20.0,3,60.0
3_BARNCOMBE_8412,3,8412,Tequila Ocho Plata Fresno,750mL,4466,AMERICAN VINTAGE BEVERAGE  ,30.0,10,300.0
4_BARNCOMBE_77,4,77,Promo Sample,50mL,9000,SAMPLE VENDOR,0,5,0
",
    )
    .unwrap();

    fs::write(
        dir.join("purchase_prices.csv"),
        "\
Brand,Description,Price,Size,Volume,Classification,PurchasePrice,VendorNumber,VendorName
58,Gekkeikan Black & Gold Sake,12.99,750mL,750,1,10.0,105,ALTAMAR BRANDS LLC
62,Herradura Silver Tequila,36.99,750mL,750,1,20.0,105,ALTAMAR BRANDS LLC
8412,Tequila Ocho Plata Fresno,45.99,750mL,,1,30.0,4466,AMERICAN VINTAGE BEVERAGE
77,Promo Sample,0.99,50mL,50,1,0,9000,SAMPLE VENDOR
",
    )
    .unwrap();

    fs::write(
        dir.join("sales.csv"),
        "\
InventoryId,Store,Brand,Description,Size,SalesQuantity,SalesDollars,SalesPrice,SalesDate,Volume,Classification,ExciseTax,VendorNo,VendorName
1_HARDERSFIELD_58,1,58,Gekkeikan Black & Gold Sake,750mL,8,103.92,12.99,1/1/2016,750,1,0.79,105,ALTAMAR BRANDS LLC
1_HARDERSFIELD_58,1,58,Gekkeikan Black & Gold Sake,750mL,12,155.88,12.99,1/2/2016,750,1,1.11,105,ALTAMAR BRANDS LLC
3_BARNCOMBE_8412,3,8412,Tequila Ocho Plata Fresno,750mL,5,229.95,45.99,1/3/2016,750,1,0.40,4466,AMERICAN VINTAGE BEVERAGE
",
    )
    .unwrap();

    fs::write(
        dir.join("vendor_invoice.csv"),
        "\
VendorNumber,VendorName,InvoiceDate,PONumber,PODate,PayDate,Quantity,Dollars,Freight,Approval
105,ALTAMAR BRANDS LLC,2016-01-04,8124,2015-12-21,2016-02-16,6,214.26,3.47,None
105,ALTAMAR BRANDS LLC,2016-02-04,8125,2016-01-21,2016-03-16,4,100.00,1.53,None
",
    )
    .unwrap();
}
